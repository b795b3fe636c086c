use sudokugen::{difficulty, Generator, GeneratorOptions};

fn main() {
    let mut generator = Generator::new(GeneratorOptions::default());
    match generator.generate() {
        Ok((puzzle, solution)) => {
            println!("{}", puzzle.format_grid());
            println!("Clues: {}", puzzle.clue_count());
            println!("Difficulty: {}", difficulty(&puzzle));
            println!("Solution: {solution}");
        }
        Err(err) => eprintln!("generation failed: {err}"),
    }
}
