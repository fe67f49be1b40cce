use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    kotlin_tasks::apps::run_cli(std::env::args().skip(1))
}
