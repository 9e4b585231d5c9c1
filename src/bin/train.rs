/**
 * FactoReco
 * Copyright (C) 2026 The FactoReco developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::env;
use std::error::Error;
use std::time::Instant;

use getopts::Options;

use factoreco::embeddings::{embedding_rng, random_embeddings};
use factoreco::io;
use factoreco::stats::{DataDictionary, Renaming};
use factoreco::CostReport;

fn main() {

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of observed \
        ratings of items by users. The input file must contain a user, an item and a numeric \
        rating per line, separated by tabs.", "PATH");
    opts.optopt("v", "validationfile", "Validation file name (optional). Held-out ratings in \
        the same format as the input file, scored every 50 iterations but never trained on. \
        Ratings of users or items that do not occur in the input file are ignored.", "PATH");
    opts.optopt("o", "outputfile", "Output file name (optional, the trained factors will be \
        written to stdout by default).", "PATH");
    opts.optopt("k", "num-factors", "Number of factors per user and item embedding (optional, \
        defaults to 3).", "NUMBER");
    opts.optopt("n", "iterations", "Number of training iterations (optional, defaults to \
        100).", "NUMBER");
    opts.optopt("l", "learning-rate", "Learning rate for the momentum updates (optional, \
        defaults to 0.01).", "NUMBER");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    if !matches.opt_present("i") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        );
    }

    let ratings_path = matches.opt_str("i").unwrap();
    let validation_path = matches.opt_str("v");
    let factors_path = matches.opt_str("o");

    let num_factors: usize = match matches.opt_get_default("k", 3) {
        Ok(num_factors) => num_factors,
        Err(failure) => {
            let hint = format!("Problem with option 'k': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let iterations: usize = match matches.opt_get_default("n", 100) {
        Ok(iterations) => iterations,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let learning_rate: f64 = match matches.opt_get_default("l", 0.01) {
        Ok(learning_rate) => learning_rate,
        Err(failure) => {
            let hint = format!("Problem with option 'l': {}", failure);
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    train(
        &ratings_path,
        validation_path,
        factors_path,
        num_factors,
        iterations,
        learning_rate,
    ).unwrap();
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>,
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn train(
    ratings_path: &str,
    validation_path: Option<String>,
    factors_path: Option<String>,
    num_factors: usize,
    iterations: usize,
    learning_rate: f64,
) -> Result<(), Box<dyn Error>> {

    println!("Reading {}", ratings_path);

    let mut reader = io::csv_reader(ratings_path)?;
    let raw_ratings: Vec<(String, String, f64)> = io::ratings_from_csv(&mut reader).collect();

    let data_dict = DataDictionary::from(raw_ratings.iter());

    println!(
        "Found {} ratings from {} users for {} items.",
        data_dict.num_ratings(),
        data_dict.num_users(),
        data_dict.num_items(),
    );

    let ratings = data_dict.encode(raw_ratings.iter());

    let validation_ratings = match validation_path {
        Some(path) => {
            println!("Reading {}", path);

            let mut reader = io::csv_reader(&path)?;
            let raw_validation: Vec<(String, String, f64)> =
                io::ratings_from_csv(&mut reader).collect();

            // Held-out ratings of unseen users or items are dropped here.
            Some(data_dict.encode(raw_validation.iter()))
        },
        None => None,
    };

    println!(
        "Training {} factors per embedding for {} iterations (learning rate {})",
        num_factors,
        iterations,
        learning_rate,
    );

    let emb_user = random_embeddings(data_dict.num_users(), num_factors, &mut embedding_rng());
    let emb_item = random_embeddings(data_dict.num_items(), num_factors, &mut embedding_rng());

    let training_start = Instant::now();

    let factorization = factoreco::factorize(
        &ratings,
        validation_ratings.as_deref(),
        emb_user,
        emb_item,
        iterations,
        learning_rate,
        num_cpus::get(),
        print_cost_report,
    )?;

    println!("Training took {}ms", training_start.elapsed().as_millis());

    // Build the reverse index, make sure we consume the data dictionary
    let renaming: Renaming = data_dict.into();

    println!("Writing factors...");
    io::write_factors(&factorization, &renaming, factors_path)?;

    Ok(())
}

fn print_cost_report(report: &CostReport) {
    match report.validation_cost {
        Some(validation_cost) => println!(
            "[{:>5}] training cost {:.6}, validation cost {:.6}",
            report.iteration,
            report.training_cost,
            validation_cost,
        ),
        None => println!(
            "[{:>5}] training cost {:.6}",
            report.iteration,
            report.training_cost,
        ),
    }
}
