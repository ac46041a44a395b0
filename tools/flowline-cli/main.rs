use clap::Parser;
use flowline::prelude::*;
use std::fs;
use std::time::Instant;

/// Validate and compile a tabular transformation flow
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor flow JSON file (`{ nodes, edges }`)
    flow_path: String,
    /// Path to the stage configuration JSON file (`{ selects, filters, strs, renames }`)
    stages_path: String,

    /// Input data file the pipeline will run on, used for the engine request
    #[arg(short, long)]
    input: Option<String>,

    /// Save the compiled plan to this file
    #[arg(short, long)]
    out: Option<String>,

    /// Print the JSON request the execution engine would receive
    #[arg(long)]
    emit_request: bool,

    /// Drop stage configuration for nodes missing from the flow before compiling
    #[arg(long)]
    prune: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    run(cli);
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let flow_json = fs::read_to_string(&cli.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flow file '{}': {}",
            &cli.flow_path, e
        ))
    });
    let flow = UiFlow::from_json(&flow_json)
        .and_then(IntoFlow::into_flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)));
    let mut stages = StageSnapshot::from_file(&cli.stages_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load stages: {}", e)));
    for error in &stages.rejected {
        eprintln!("Skipped stage configuration: {}", error);
    }

    if cli.prune {
        let before = stages.len();
        stages.retain_nodes(&flow);
        println!("Pruned {} orphaned stage configuration(s)", before - stages.len());
    }

    // --- 2. Validation ---
    let verdict = validate_execution_path(&flow);
    println!("{}", PlanFormatter::describe_validation(&verdict));
    if !verdict.is_valid() {
        std::process::exit(2);
    }

    // --- 3. Compilation ---
    let compile_start = Instant::now();
    let plan = stages.compiler().compile_flow(&flow);
    let compile_duration = compile_start.elapsed();

    println!("\nCompiled {} operation(s) in {:?}", plan.operations.len(), compile_duration);
    println!("{}", PlanFormatter::render_plan(&plan.operations));

    if let Some(out) = &cli.out {
        plan.save(out)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save plan: {}", e)));
        println!("\nPlan saved to '{}'", out);
    }

    if cli.emit_request {
        let input = cli.input.clone().unwrap_or_default();
        let json = plan
            .to_engine_request(input)
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode request: {}", e)));
        println!("\n{}", json);
    }

    println!("\nTotal: {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
