use nalgebra::{DMatrix, DVector};
use treesim_analysis::ModeComparison;
use treesim_sim::evolution::SubstitutionModel;
use treesim_sim::simulation::{Configuration, ModelConfig, RatePrior};

pub fn print_configuration(config: &Configuration) {
    let execution = &config.execution;

    println!("\n📋 Simulation Configuration");
    println!("  • Tree: {} [--tree, --tree-file]", config.tree);
    println!("  • Sequence Length: {} [-L, --length]", execution.length);
    println!("  • Mutation Mode: {} [-m, --mode]", execution.mode);
    println!("  • Replicates: {} [-n, --replicates]", execution.replicates);
    if let Some(seed) = execution.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n🧬 Substitution Model");
    match &config.model {
        ModelConfig::SiFit3 { lambda_d, lambda_l } => {
            println!("  • Model: SiFit3 [--model]");
            println!("  • Rates: λd = {lambda_d}, λl = {lambda_l} [--lambda-d, --lambda-l]");
        }
        ModelConfig::SiFit5 { lambda_d, lambda_l } => {
            println!("  • Model: SiFit5 [--model]");
            println!("  • Rates: λd = {lambda_d}, λl = {lambda_l} [--lambda-d, --lambda-l]");
        }
        ModelConfig::Custom { states, .. } => {
            println!("  • Model: Custom");
            println!("  • States: {states}");
        }
    }
    match &execution.rate_prior {
        Some(RatePrior::LogNormal { mu, sigma }) => {
            println!("  • Rate Prior: LogNormal(μ = {mu}, σ = {sigma}) per replicate");
        }
        None => println!("  • Rate Prior: None (fixed rates)"),
    }
    println!();
}

pub fn print_model(model: &dyn SubstitutionModel, beta: f64, t: f64) {
    let alphabet = model.alphabet();
    let symbols: Vec<String> = alphabet.chars().iter().map(|c| c.to_string()).collect();

    println!("\n🧬 Model: {}", model.name());
    println!("  • Alphabet: {}", symbols.join(" "));
    println!("  • Normalization (β): {beta:.6}");
    println!("  • Mean Rate: {:.6}", model.mean_rate());

    println!("\n📊 Equilibrium Frequencies (π)");
    print_vector(&symbols, &model.pi());

    println!("\n⚡ Rate Matrix (Q)");
    print_matrix(&symbols, &model.q());

    println!("\n⏱  Transition Matrix P(t), t = {t}");
    print_matrix(&symbols, &model.p(t));
    println!();
}

pub fn print_comparison(report: &ModeComparison) {
    println!("\n⚖️  Mutation Mode Comparison");
    println!("  • Model: {}", report.model);
    println!("  • Branch Length: {} [-t, --time]", report.time);
    println!("  • Ancestor Length: {} [-L, --length]", report.length);
    println!("  • Trials: {} [-n, --trials]", report.trials);

    println!("\n🔬 Differing Sites");
    println!("  • Expected: {:.3}", report.expected_differences);
    println!(
        "  • expm:     mean {:.3}, variance {:.3}",
        report.expm_differences.mean, report.expm_differences.variance
    );
    println!(
        "  • poisson:  mean {:.3}, variance {:.3}",
        report.poisson_differences.mean, report.poisson_differences.variance
    );

    println!("\n🎲 Substitution Events");
    println!("  • Expected: {:.3}", report.expected_events);
    println!(
        "  • poisson:  mean {:.3}, variance {:.3}",
        report.poisson_events.mean, report.poisson_events.variance
    );
    println!();
}

fn print_vector(symbols: &[String], values: &DVector<f64>) {
    for (symbol, value) in symbols.iter().zip(values.iter()) {
        println!("    {symbol}: {value:>10.6}");
    }
}

fn print_matrix(symbols: &[String], matrix: &DMatrix<f64>) {
    let header: String = symbols.iter().map(|s| format!("{s:>11}")).collect();
    println!("     {header}");
    for (i, symbol) in symbols.iter().enumerate() {
        let row: String = matrix.row(i).iter().map(|v| format!("{v:>11.6}")).collect();
        println!("    {symbol}{row}");
    }
}
