mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands, ConvertCommands};

fn main() {
    let cli = Cli::parse();
    let store = cli.store;

    let result = match cli.command {
        Commands::New {
            name,
            template,
            dataset,
        } => commands::session::run_new(&store, &name, &template, &dataset, cli.verbose),
        Commands::List { json } => commands::session::run_list(&store, json),
        Commands::Delete { name } => commands::session::run_delete(&store, &name),
        Commands::Replace {
            name,
            template,
            dataset,
        } => commands::session::run_replace(&store, &name, template.as_deref(), dataset.as_deref()),
        Commands::Tokens { template, json } => commands::tokens::run(&template, json),
        Commands::Generate {
            name,
            base,
            filename_column,
            font,
            font_size,
            output,
        } => commands::generate::run(
            &store,
            &name,
            base,
            filename_column,
            font,
            font_size,
            output,
            cli.verbose,
        ),
        Commands::Download { name, output } => commands::download::run(&store, &name, output),
        Commands::Convert(convert_cmd) => match convert_cmd {
            ConvertCommands::DocxToPdf { input, output } => {
                commands::convert::run_docx_to_pdf(&input, output)
            }
            ConvertCommands::PdfToDocx { input, output } => {
                commands::convert::run_pdf_to_docx(&input, output)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
