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

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::stdout;
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::stats::Renaming;
use crate::Factorization;

/// Opens a CSV reader over a rating file. We expect NO headers, and a user,
/// item, rating triple per line with tab separation.
pub fn csv_reader(file: &str) -> Result<csv::Reader<File>, csv::Error> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(file)?;

    Ok(reader)
}

/// Reads the raw rating triples from a CSV reader. Records that do not parse
/// are skipped.
pub fn ratings_from_csv<'a, R>(
    reader: &'a mut csv::Reader<R>,
) -> impl Iterator<Item = (String, String, f64)> + 'a
where
    R: io::Read,
{
    reader.deserialize::<(String, String, f64)>()
        .filter_map(Result::ok)
}

/// Structs used for JSON serialization of the trained factors. Field names
/// will be used in JSON.
#[derive(Serialize)]
struct UserFactors<'a> {
    user: &'a str,
    factors: Vec<f64>,
}

#[derive(Serialize)]
struct ItemFactors<'a> {
    item: &'a str,
    factors: Vec<f64>,
}

/// Outputs the trained factors in JSON format, one line per user or item,
/// using the original identifiers from the input file. If a `factors_path`
/// is supplied, we write to a file at the specified path, otherwise, we
/// output to stdout.
pub fn write_factors(
    factorization: &Factorization,
    renaming: &Renaming,
    factors_path: Option<String>,
) -> io::Result<()> {

    let mut out: Box<dyn Write> = match factors_path {
        Some(path) => Box::new(File::create(Path::new(&path))?),
        _ => Box::new(stdout()),
    };

    for (user_index, factors) in factorization.emb_user.rows().into_iter().enumerate() {

        let factors_as_json = json!(UserFactors {
            user: renaming.user_name(user_index as u32),
            factors: factors.to_vec(),
        });

        writeln!(out, "{}", factors_as_json)?;
    }

    for (item_index, factors) in factorization.emb_item.rows().into_iter().enumerate() {

        let factors_as_json = json!(ItemFactors {
            item: renaming.item_name(item_index as u32),
            factors: factors.to_vec(),
        });

        writeln!(out, "{}", factors_as_json)?;
    }

    Ok(())
}
