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

#[cfg(test)]
mod tests {

    use crate::embeddings::{embedding_rng, random_embeddings};
    use crate::factorize;
    use crate::stats::{DataDictionary, Renaming};

    #[test]
    fn programmatic_usage() {

        /* Our input data comprises of observed ratings of items by users. The
           identifiers used can be strings of arbitrary length and structure. */
        let ratings = vec![
            (String::from("alice"), String::from("apple"), 5.0),
            (String::from("alice"), String::from("dog"), 2.0),
            (String::from("alice"), String::from("pony"), 4.0),
            (String::from("bob"), String::from("apple"), 4.5),
            (String::from("bob"), String::from("pony"), 3.0),
            (String::from("charles"), String::from("pony"), 5.0),
            (String::from("charles"), String::from("bike"), 1.0),
        ];

        /* Internally, factoreco uses consecutive integer ids for users and items.
           We read the rating data once to compute a data dictionary that maps the
           string identifiers to integer ids and has basic statistics of the data. */
        let data_dict = DataDictionary::from(ratings.iter());

        println!(
            "Found {} ratings from {} users for {} items.",
            data_dict.num_ratings(),
            data_dict.num_users(),
            data_dict.num_items(),
        );

        /* Next we translate the ratings into index-based triples and create the
           fixed-seed starting embeddings for both users and items. */
        let encoded_ratings = data_dict.encode(ratings.iter());

        let emb_user = random_embeddings(data_dict.num_users(), 2, &mut embedding_rng());
        let emb_item = random_embeddings(data_dict.num_items(), 2, &mut embedding_rng());

        /* Now we train the factorization for a fixed number of iterations. The
           callback sees the training cost every 50 iterations. */
        let factorization = factorize(
            &encoded_ratings,   // The encoded ratings to learn from
            None,               // No held-out ratings in this example
            emb_user,           // Starting embeddings for the users
            emb_item,           // Starting embeddings for the items
            100,                // The number of training iterations
            0.01,               // The learning rate
            2,                  // The number of CPUs to use for the computation
            |report| println!(
                "[{}] training cost {}",
                report.iteration,
                report.training_cost,
            ),
        ).unwrap();

        /* The renaming data structure helps us map the integer ids back to the
           original string ids. */
        let renaming = Renaming::from(data_dict);

        /* We print the trained factors per user and item. */
        for (user_index, factors) in factorization.emb_user.rows().into_iter().enumerate() {
            println!("{}: {:?}", renaming.user_name(user_index as u32), factors.to_vec());
        }

        for (item_index, factors) in factorization.emb_item.rows().into_iter().enumerate() {
            println!("{}: {:?}", renaming.item_name(item_index as u32), factors.to_vec());
        }
    }
}
