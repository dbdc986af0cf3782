//! CLI entry point: parse arguments, validate them into a traversal
//! config, and run the engine to completion (spec.md §6).

use clap::{CommandFactory, Parser};
use clap_complete::aot::generate;
use parawalk::cli::Args;
use parawalk::Engine;

fn main() {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        let mut command = Args::command();
        let name = command.get_name().to_owned();
        generate(shell, &mut command, name, &mut std::io::stdout());
        return;
    }

    let (config, filters) = match args.resolve() {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("parawalk: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = config.validate() {
        eprintln!("parawalk: {err}");
        std::process::exit(1);
    }

    let roots = config.roots.clone();
    let exit_code = Engine::new(config, filters).run(roots);
    std::process::exit(exit_code);
}
