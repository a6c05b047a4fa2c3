use std::path::PathBuf;

use clap::Parser;
use log::info;

use cgs_graph::clause::{Clause, CmpOp, Instruction, Payload, Predicate, Term};
use cgs_graph::config::GraphConfig;
use cgs_graph::graph::ExecutionGraph;
use cgs_graph::trace::Trace;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of concrete runs to ingest.
    #[arg(value_name = "INT", default_value = "6")]
    runs: usize,

    /// Maximum number of ancestors per context.
    #[clap(short, long, value_name = "INT", default_value = "4")]
    k: usize,

    /// Write the final graph in DOT format to this file.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Enable debug logging from the graph.
    #[clap(long)]
    verbose: bool,
}

/// Trace of one run of:
///
/// ```text
/// L0: x, y = input()
/// L1: if x > y {
/// L2:     t = x - y
/// L3:     switch t { 1 | 2 | 3 => .., _ => .. }
///     } else {
/// L4:     if x == 0 { L5: r = 0 }
///     }
/// L6: return
/// ```
fn run(x: i64, y: i64) -> Trace {
    let mut clauses = vec![Clause::effect(0, Payload::opaque("x, y = input()"))];

    let x_gt_y = Term::cmp(CmpOp::Gt, Term::var("x"), Term::var("y"));
    clauses.push(Clause::branch(1, Payload::equality(x_gt_y, Term::bool(x > y))));

    if x > y {
        clauses.push(Clause::effect(2, Payload::opaque("t = x - y")));
        let t = x - y;
        let key = if (1..=3).contains(&t) { t } else { -1 };
        clauses.push(Clause::new(
            3.into(),
            Instruction::Switch { branches: 3 },
            Predicate::path(Payload::equality(Term::var("t"), Term::int(key))),
        ));
    } else {
        let payload = if x == 0 {
            Payload::equality(Term::var("x"), Term::int(0))
        } else {
            Payload::inequality(Term::var("x"), Term::int(0))
        };
        clauses.push(Clause::new(4.into(), Instruction::Other, Predicate::path(payload)));
        if x == 0 {
            clauses.push(Clause::effect(5, Payload::opaque("r = 0")));
        }
    }

    clauses.push(Clause::effect(6, Payload::opaque("return")));
    Trace::new(clauses)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let mut graph = ExecutionGraph::with_config(GraphConfig::default().with_context_limit(args.k));

    // Fixed input schedule, so that runs are reproducible.
    let inputs = [(5, 4), (0, 3), (7, 5), (2, 9), (9, 6), (10, 1), (0, 0), (4, 3)];
    for &(x, y) in inputs.iter().cycle().take(args.runs) {
        let trace = run(x, y);
        info!("run(x = {}, y = {}): {} clauses", x, y, trace.len());
        graph.ingest(&trace);
    }

    println!("{}", graph.dump()?);

    for depth in 1..=graph.depth() {
        let all = graph.branches_at(depth);
        let open = graph.open_branches_at(depth);
        println!("depth {}: {} branches, {} open", depth, all.len(), open.len());

        for target in open {
            println!("  target {} `{}`", target, graph[target].clause());
            for context in graph.default_contexts(target) {
                let conditions: Vec<String> = context.conditions(&graph).iter().map(|c| c.to_string()).collect();
                println!("    via {} path clauses: [{}]", context.path().len(), conditions.join(", "));
            }
        }
    }

    if let Some(path) = args.dot {
        std::fs::write(&path, graph.to_dot()?)?;
        info!("DOT written to {}", path.display());
    }

    Ok(())
}
