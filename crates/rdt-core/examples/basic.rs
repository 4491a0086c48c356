//! Basic stream generation example.
//!
//! Builds each generator from the default seed and prints its first words
//! as hex.
//!
//! Run: `cargo run --example basic`

use rdt_core::{Seed256, SourceKind, generate};

fn main() {
    println!("Seed: {}", Seed256::DEFAULT);

    for kind in SourceKind::ALL {
        let mut source = kind.build(&Seed256::DEFAULT);
        let stream = match generate(source.as_mut(), 4, 64) {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };

        println!("\n{} — {}", kind, source.info().description);
        for value in stream.values() {
            println!("  {value:016x}");
        }
    }
}
