//! codeslice-ir CLI: dump a repo's call graph to JSON, list call chains reaching an entity,
//! or print the interprocedural backward slice of a statement.
//!
//! ```bash
//! slicectl dump-call-graph --repo . --output callgraph.json
//! slicectl call-chains --repo . --entity pkg.mod.func
//! slicectl slice --repo . --file pkg/mod.py --function func --line 12
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use codeslice_ir::config::AnalysisConfig;
use codeslice_ir::errors::SliceError;
use codeslice_ir::features::ast::domain::DefKind;
use codeslice_ir::features::ast::infrastructure::{find_def, parse_file};
use codeslice_ir::features::call_graph::infrastructure::{construct, write_to_file, AstCallGraphEngine};
use codeslice_ir::features::call_graph::infrastructure::engine::function_id as compute_function_id;
use codeslice_ir::features::cfg::infrastructure::build_cfg;
use codeslice_ir::features::orchestration::application::{OrchestrationUseCase, OrchestrationUseCaseImpl};
use codeslice_ir::features::slicing::infrastructure::{backward_slice_interprocedural, RepoFunctionLocator};

#[derive(Parser)]
#[command(name = "slicectl")]
#[command(about = "Interprocedural backward slicing for Python repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the call graph and write it out as JSON.
    DumpCallGraph {
        #[arg(short, long)]
        repo: PathBuf,

        #[arg(short, long, default_value = "callgraph.json")]
        output: PathBuf,
    },

    /// List every call chain reaching an entity id.
    CallChains {
        #[arg(short, long)]
        repo: PathBuf,

        #[arg(short, long)]
        entity: String,
    },

    /// Print the interprocedural backward slice of a statement, identified by the function
    /// it's in plus its source line.
    Slice {
        #[arg(short, long)]
        repo: PathBuf,

        #[arg(short, long)]
        file: PathBuf,

        #[arg(short = 'n', long)]
        function: String,

        #[arg(short, long)]
        line: usize,
    },

    /// Trace every parameter of a function back through its callers.
    TraceArgs {
        #[arg(short, long)]
        repo: PathBuf,

        #[arg(short, long)]
        file: PathBuf,

        #[arg(short = 'n', long)]
        function: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::DumpCallGraph { repo, output } => dump_call_graph(&repo, &output),
        Commands::CallChains { repo, entity } => call_chains(&repo, &entity),
        Commands::Slice { repo, file, function, line } => slice(&repo, &file, &function, line),
        Commands::TraceArgs { repo, file, function } => trace_args(&repo, &file, &function),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            exit_code_for(&e)
        }
    }
}

/// I/O failures and unreadable/unparseable sources each get their own nonzero code so CI
/// scripts can tell "nothing there" from "couldn't even read the repo" apart.
fn exit_code_for(err: &SliceError) -> ExitCode {
    match err {
        SliceError::Io(_) => ExitCode::from(2),
        SliceError::Parse { .. } => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

fn dump_call_graph(repo: &PathBuf, output: &PathBuf) -> codeslice_ir::errors::Result<()> {
    let config = AnalysisConfig::default();
    let (graph, sanity) = construct(repo, &config, &AstCallGraphEngine::new())?;
    write_to_file(&graph, output)?;
    for (caller_id, entry) in &sanity.entries {
        for warning in &entry.warnings {
            tracing::warn!(caller = %caller_id, "{warning}");
        }
    }
    println!("wrote {} callers to {}", graph.len(), output.display());
    Ok(())
}

fn call_chains(repo: &PathBuf, entity: &str) -> codeslice_ir::errors::Result<()> {
    let usecase = OrchestrationUseCaseImpl::new(AnalysisConfig::default());
    let report = usecase.list_call_chains(repo, entity)?;
    if report.chains.is_empty() {
        println!("no call chains reach {entity}");
    }
    for chain in &report.chains {
        println!("{}", chain.join(" <- "));
    }
    Ok(())
}

fn trace_args(repo: &PathBuf, file: &PathBuf, function: &str) -> codeslice_ir::errors::Result<()> {
    let usecase = OrchestrationUseCaseImpl::new(AnalysisConfig::default());
    let report = usecase.trace_arguments(repo, file, function)?;
    println!("{}", report.function_id);
    for trace in &report.traces {
        match &trace.first_use {
            Some(span) => println!("  {} first read at line {}", trace.parameter, span.start_line),
            None => println!("  {} is never read", trace.parameter),
        }
        for stmt in &trace.slice.statements {
            println!("    {}:{} {}", stmt.function_id, stmt.span.start_line, stmt.snippet.trim());
        }
        for skipped in &trace.slice.skipped {
            tracing::warn!(chain = ?skipped.chain, reason = %skipped.reason, "skipped call-site");
        }
    }
    Ok(())
}

fn slice(repo: &PathBuf, file: &PathBuf, function: &str, line: usize) -> codeslice_ir::errors::Result<()> {
    let config = AnalysisConfig::default();
    let (graph, _sanity) = construct(repo, &config, &AstCallGraphEngine::new())?;

    let tree = parse_file(file)?;
    let def_id = find_def(&tree, function, Some(DefKind::Function)).ok_or_else(|| {
        SliceError::analysis(format!("no function named {function} in {}", file.display()))
    })?;
    let cfg = build_cfg(&tree, def_id);

    let target_stmt = cfg
        .statement_nodes()
        .map(|(_, stmt_id)| stmt_id)
        .find(|&stmt_id| tree.node(stmt_id).span.start_line == line as u32)
        .ok_or_else(|| SliceError::analysis(format!("no statement at line {line} in {function}")))?;

    let function_id = compute_function_id(file, repo, &tree, def_id);
    let locator = RepoFunctionLocator::new();
    let result = backward_slice_interprocedural(repo, &graph, &locator, &function_id, target_stmt);

    let mut statements: Vec<_> = result.statements.into_iter().collect();
    statements.sort_by(|a, b| (&a.function_id, a.span.start_line).cmp(&(&b.function_id, b.span.start_line)));
    for stmt in &statements {
        println!("{}:{} {}", stmt.function_id, stmt.span.start_line, stmt.snippet.trim());
    }
    for skipped in &result.skipped {
        tracing::warn!(chain = ?skipped.chain, reason = %skipped.reason, "skipped call-site");
    }
    Ok(())
}
