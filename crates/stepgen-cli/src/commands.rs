use std::fs;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use stepgen_core::generate_timeline;
use stepgen_substeps::expand_substeps;

use stepgen_cli::protocol::load_protocol;

use crate::cli::CompileArgs;
use crate::summary::apply_table_style;
use crate::types::CompileResult;

pub fn run_compile(args: &CompileArgs) -> Result<CompileResult> {
    let span = info_span!("compile", protocol = %args.protocol.display());
    let _guard = span.enter();

    let protocol = load_protocol(&args.protocol).context("load protocol")?;
    let (context, initial) = protocol.resolve().context("resolve protocol entities")?;
    info!(steps = protocol.steps.len(), "compiling protocol");
    let timeline = generate_timeline(&context, &initial, &protocol.steps);
    info!(
        errors = timeline.error_count(),
        warnings = timeline.warning_count(),
        "compile finished"
    );

    let mut substeps = Vec::new();
    if args.substeps {
        let mut prev_state = &initial;
        for (step, frame) in protocol.steps.iter().zip(timeline.frames.iter()) {
            substeps.push(expand_substeps(step, frame, prev_state));
            prev_state = &frame.robot_state;
        }
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&timeline).context("serialize timeline")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote compiled timeline");
    }

    let protocol_name = protocol.metadata.name.clone().unwrap_or_else(|| {
        args.protocol
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "protocol".to_string())
    });
    Ok(CompileResult {
        protocol_name,
        steps: protocol.steps,
        timeline,
        substeps,
        output_path: args.output.clone(),
    })
}

pub fn run_steps() -> Result<()> {
    let step_types = [
        ("transfer", "Move a volume from each source well to its paired destination"),
        ("consolidate", "Pool a volume from several source wells into one destination"),
        ("distribute", "Spread a volume from one source well across several destinations"),
        ("mix", "Aspirate and dispense in place to mix a well"),
        ("pause", "Wait a fixed time or until the operator resumes"),
        ("moveLabware", "Move a labware to another deck slot"),
        ("setTemperature", "Set a temperature module target"),
        ("awaitTemperature", "Wait for a temperature module to reach its target"),
        ("deactivateTemperature", "Deactivate a temperature module"),
        ("engageMagnet", "Raise the magnetic module magnets"),
        ("disengageMagnet", "Lower the magnetic module magnets"),
        ("thermocyclerSetBlock", "Set or clear the thermocycler block target"),
        ("thermocyclerSetLid", "Position and/or heat the thermocycler lid"),
    ];
    let mut table = Table::new();
    table.set_header(vec!["Step type", "Description"]);
    apply_table_style(&mut table);
    for (name, description) in step_types {
        table.add_row(vec![name, description]);
    }
    println!("{table}");
    Ok(())
}
