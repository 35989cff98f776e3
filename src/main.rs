use areal::app::document::{AreaDocument, AssembledAreas};
use areal::app::{assemble_ops, problem_log};
use areal::config::AssemblerConfiguration;
use areal::model::CliError;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct ArealAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    Assemble {
        #[arg(long, help = "path to JSON document with ways and relations")]
        input_file: String,
        #[arg(long, help = "path to file with areal assembly parameters")]
        configuration_file: Option<String>,
        #[arg(long, help = "output path for the assembled areas document")]
        output_file: String,
    },
}

pub fn run(app: &App) -> Result<(), CliError> {
    env_logger::init();
    match app {
        App::Assemble {
            input_file,
            configuration_file,
            output_file,
        } => {
            let config = match configuration_file {
                None => Ok(AssemblerConfiguration::default()),
                Some(f) => {
                    log::info!("reading areal configuration from {f}");
                    AssemblerConfiguration::try_from(f)
                }
            }?;
            let document = AreaDocument::from_file(input_file)?;
            let (areas, problems) = assemble_ops::assemble_document(&document, &config)?;
            if let Some(problem_file) = &config.problem_file {
                problem_log::write_problem_file(problem_file, &problems)?;
                log::info!("wrote {} problems to {problem_file}", problems.len());
            }
            let output = AssembledAreas { areas };
            output.write_file(output_file)?;
            eprintln!("finished.");
            Ok(())
        }
    }
}

fn main() {
    let args = ArealAppArguments::parse();
    match run(&args.app) {
        Ok(_) => {}
        Err(e) => {
            log::error!("areal failed: {e}");
            panic!("{}", e.to_string())
        }
    }
}
