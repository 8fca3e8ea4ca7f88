use anyhow::Result;
use eve_sde_to_docs::{
    cli::{Cli, Commands},
    convert::{all_converters, resolve_converters, run_pipeline, CancelToken},
    sink::JsonlStore,
    source::SdeSource,
    ui::{ConsoleUi, Phase, Ui},
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Convert {
            input_db,
            output_dir,
            include,
            exclude,
            verbose,
        } => {
            let converters = resolve_converters(include, exclude)?;
            let mut ui = ConsoleUi::new(verbose);

            // Both handles must be ready before the destructive clear.
            ui.set_phase(Phase::Connecting);
            let source = SdeSource::open(&input_db)?;
            let mut store = JsonlStore::open(&output_dir)?;

            let cancel = CancelToken::new();
            let summary = run_pipeline(&source, &mut store, &converters, &mut ui, &cancel)?;

            println!();
            for (collection, count) in &summary.collections {
                println!("  {:24} {:>10} documents", collection, count);
            }
            println!(
                "\nWrote {} documents to {:?} in {:.1}s",
                summary.total_documents,
                output_dir,
                summary.elapsed.as_secs_f64()
            );
        }

        Commands::ListConverters => {
            println!("Available converters:\n");
            for converter in all_converters() {
                println!("  {:20} -> {}", converter.name(), converter.collection());
            }
        }
    }

    Ok(())
}
