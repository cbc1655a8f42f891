//! `seqflow`: utilidades de línea de comandos sobre el codec de nombres y
//! las estrategias de split/merge de los formatos incluidos.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{info, warn};
use seqflow_adapters::builtin_formats;
use seqflow_core::{discover_data, merge_data, split_data, Compression, Data, DataFile, DataFormat, DataFormatRegistry,
                   EngineConfig, FileNaming, MergeOptions, OutputPort, Parameters, PortData};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "seqflow", version, about = "Inspect and manipulate seqflow data files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Descompone un nombre de fichero y lo muestra en JSON.
    Parse { filename: String },
    /// Nombre equivalente con la convención antigua de prefijos.
    Compat { filename: String },
    /// Lista los datos presentes en un directorio.
    Ls {
        /// Directorio; por defecto el de trabajo (`SEQFLOW_WORKING_DIR`).
        dir: Option<PathBuf>,
        /// Restringe a un `(step, puerto, formato)`; requiere los tres.
        #[arg(long, requires_all = ["port", "format"])]
        step: Option<String>,
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        format: Option<String>,
    },
    /// Parte los ficheros de un dato en partes numeradas.
    Split {
        #[arg(long)]
        format: String,
        /// Nombre del dato a partir.
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "split")]
        step: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Parámetro del splitter, `clave=valor`.
        #[arg(long = "param", short, value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Une las partes producidas por `step.port` en un directorio.
    Merge {
        #[arg(long)]
        format: String,
        /// Step que produjo las partes.
        #[arg(long)]
        from_step: String,
        #[arg(long, default_value = "output")]
        from_port: String,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value = "merge")]
        step: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long = "param", short, value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
     .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
     .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

fn parameters(pairs: &[(String, String)]) -> Result<Parameters, Box<dyn Error>> {
    let mut out = Parameters::new();
    for (name, value) in pairs {
        out = out.with(name, value.as_str())?;
    }
    Ok(out)
}

fn lookup_format<'r>(registry: &'r DataFormatRegistry, name: &str) -> Result<&'r DataFormat, Box<dyn Error>> {
    registry.by_name_or_alias(name).ok_or_else(|| format!("unknown data format: {name}").into())
}

fn print_files(port: &PortData) -> CliResult {
    for data in port.elements() {
        for index in 0..data.data_file_count() {
            println!("{}", data.data_file_at(index)?.path().display());
        }
    }
    Ok(())
}

fn ls(dir: &Path, filter: Option<(&str, &str, &DataFormat)>, registry: &DataFormatRegistry) -> CliResult {
    if let Some((step, port, format)) = filter {
        for data in discover_data(dir, step, port, format, &Compression::ALL, registry)? {
            println!("{}", serde_json::to_string(&data.to_json())?);
        }
        return Ok(());
    }
    let mut names: Vec<String> = fs::read_dir(dir)?.filter_map(|e| e.ok())
                                                   .filter_map(|e| e.file_name().to_str().map(str::to_string))
                                                   .collect();
    names.sort();
    for name in names {
        match FileNaming::parse(&name, registry) {
            Ok(naming) => println!("{}", serde_json::to_string(&naming)?),
            Err(e) => warn!("skipping {name}: {e}"),
        }
    }
    Ok(())
}

fn run(cli: Cli) -> CliResult {
    let config = EngineConfig::from_env()?;
    let registry = builtin_formats()?;

    match cli.command {
        Command::Parse { filename } => {
            let naming = FileNaming::parse(&filename, &registry)?;
            println!("{}", serde_json::to_string_pretty(&naming)?);
        }
        Command::Compat { filename } => {
            println!("{}", FileNaming::parse(&filename, &registry)?.compatibility_filename());
        }
        Command::Ls { dir, step, port, format: format_name } => {
            let dir = dir.unwrap_or_else(|| config.working_directory.clone());
            match (step, port, format_name) {
                (Some(step), Some(port), Some(name)) => {
                    let format = lookup_format(&registry, &name)?;
                    ls(&dir, Some((&step, &port, format)), &registry)?;
                }
                _ => ls(&dir, None, &registry)?,
            }
        }
        Command::Split { format: format_name, name, step, output, params, files } => {
            let format = lookup_format(&registry, &format_name)?;
            let mut splitter = format.splitter().ok_or_else(|| format!("format {} has no splitter", format.name()))?;
            splitter.configure(&step, &parameters(&params)?)?;
            let input = Data::from_files(&name, format, None, files.into_iter().map(DataFile::new).collect());
            let directory = output.unwrap_or_else(|| config.working_directory.clone());
            let mut parts = PortData::for_output(&OutputPort::new("output", format)?.with_list(true), &step, directory);
            let count = split_data(splitter.as_ref(), &input, &mut parts)?;
            info!("{name}: {count} parts");
            print_files(&parts)?;
        }
        Command::Merge { format: format_name, from_step, from_port, input, step, output, params } => {
            let format = lookup_format(&registry, &format_name)?;
            let mut merger = format.merger().ok_or_else(|| format!("format {} has no merger", format.name()))?;
            merger.configure(&step, &parameters(&params)?)?;
            let input = input.unwrap_or_else(|| config.working_directory.clone());
            let parts = discover_data(&input, &from_step, &from_port, format, &Compression::ALL, &registry)?;
            let directory = output.unwrap_or_else(|| config.working_directory.clone());
            let mut merged = PortData::for_output(&OutputPort::new("output", format)?.with_list(true), &step, directory);
            let count = merge_data(merger.as_ref(), &parts, &mut merged, &MergeOptions::default())?;
            info!("{count} data merged from {} parts", parts.len());
            print_files(&merged)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_writer(std::io::stderr)
                             .init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("seqflow: {e}");
            ExitCode::FAILURE
        }
    }
}
