//! Integrates the reference functions with a chosen split count and policy.
//!
//! ```text
//! riemann [SPLIT_COUNT] [POLICY] [--log LEVEL] [--legacy-partition]
//! ```
//!
//! Missing positional arguments are asked for on stdin. `POLICY` is `1`-`4`
//! or one of `left`, `middle`, `right`, `random`.

use std::error::Error;
use std::io::{self, BufRead, Write};

use log::{info, LevelFilter};
use riemann_expr::{
    parse_split_count, Expression, Integral, Partition, QuadratureEngine, SamplingPolicy,
};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

const REFERENCE_INTEGRALS: [(&str, f64, f64); 5] = [
    ("5^x", 0.0, 3.0),
    ("e^x", 0.0, 1.0),
    ("e^-x", -1.0, 1.0),
    ("e^(3*x)", 0.0, 0.5),
    ("e^(2*x)", 0.0, 1.0),
];

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut positional = Vec::new();
    let mut log_level = LevelFilter::Info;
    let mut partition = Partition::Indexed;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--log" => log_level = args.next().ok_or("--log expects a level")?.parse()?,
            "--legacy-partition" => partition = Partition::Accumulated,
            _ => positional.push(arg),
        }
    }

    CombinedLogger::init(vec![TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    let split_count = match positional.first() {
        Some(arg) => parse_split_count(arg)?,
        None => parse_split_count(&prompt("Input number of split points: ")?)?,
    };
    let policy: SamplingPolicy = match positional.get(1) {
        Some(arg) => arg.parse()?,
        None => prompt(
            "Choose number of sampling method: 1 - left, 2 - middle, 3 - right, 4 - random: ",
        )?
        .parse()?,
    };

    let engine = QuadratureEngine::new(split_count, policy)?.with_partition(partition);
    info!("split count = {split_count}, policy = {policy}, partition = {partition:?}");

    for (text, start, end) in REFERENCE_INTEGRALS {
        let integral = Integral::new(Expression::parse(text)?);
        let report = integral.report(engine.build_plan(start, end)?)?;
        println!("{report}");
    }
    Ok(())
}
