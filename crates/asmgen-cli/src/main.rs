use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use asmgen::abi::{STACK_MAP_LABEL, STACK_PTR_DWARF_REG, TEMP_SYMBOL_PREFIX};
use asmgen::{PatchpointMap, Processor, TranslateOptions};

#[derive(Parser)]
#[command(name = "asmgen")]
#[command(about = "Translate ARM assembly with an LLVM stack map into macro-assembler calls")]
struct Cli {
    #[arg(help = "Input assembly file")]
    input: PathBuf,

    #[arg(long, default_value = STACK_MAP_LABEL, help = "Label of the stack map table")]
    stack_map_label: String,

    #[arg(
        long,
        default_value = TEMP_SYMBOL_PREFIX,
        help = "Prefix of the callsite symbols referenced by stack map records"
    )]
    temp_symbol_prefix: String,

    #[arg(
        long,
        default_value_t = STACK_PTR_DWARF_REG,
        help = "DWARF register number of the stack pointer"
    )]
    sp_reg: u16,

    #[arg(
        long,
        help = "Print the decoded stack map as JSON, ordered by callsite label, instead of translating"
    )]
    dump_stack_map: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    tracing::debug!(input = %cli.input.display(), bytes = source.len(), "read input");

    let options = TranslateOptions {
        stack_map_label: cli.stack_map_label,
        temp_symbol_prefix: cli.temp_symbol_prefix,
        stack_pointer_reg: cli.sp_reg,
    };

    let processor = Processor::new(&source, options)
        .decode()
        .with_context(|| format!("Failed to decode stack map in {}", cli.input.display()))?;
    tracing::info!(
        blocks = processor.labels().len(),
        patchpoints = processor.patchpoints().len(),
        "decoded input"
    );

    if cli.dump_stack_map {
        let json = stack_map_json(processor.patchpoints());
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let processor = processor
        .translate()
        .with_context(|| format!("Failed to translate {}", cli.input.display()))?;
    print!("{}", processor.render());

    Ok(())
}

fn stack_map_json(patchpoints: &PatchpointMap) -> serde_json::Value {
    let records: Vec<serde_json::Value> = patchpoints
        .values()
        .map(|pp| {
            let locations: Vec<serde_json::Value> = pp
                .locations
                .iter()
                .map(|loc| {
                    serde_json::json!({
                        "kind": loc.kind.name(),
                        "size": loc.size,
                        "reg_no": loc.reg_no,
                        "offset_or_constant": loc.offset_or_constant,
                    })
                })
                .collect();
            serde_json::json!({
                "id": pp.id,
                "label": pp.label_name,
                "locations": locations,
            })
        })
        .collect();
    serde_json::Value::Array(records)
}
