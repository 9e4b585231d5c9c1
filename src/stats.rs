use fnv::FnvHashMap;

use crate::types::Ratings;

/// Maps the raw user and item identifiers of a ratings table to dense,
/// zero-based indexes. Indexes are assigned in first-occurrence order, so
/// building the dictionary twice from the same data yields the identical
/// mapping. The dictionary is built once from the training data and never
/// mutated afterwards.
pub struct DataDictionary {
    user_dict: FnvHashMap<String, u32>,
    item_dict: FnvHashMap<String, u32>,
    num_ratings: u64,
}

impl DataDictionary {

    pub fn num_users(&self) -> usize {
        self.user_dict.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_dict.len()
    }

    pub fn num_ratings(&self) -> u64 {
        self.num_ratings
    }

    pub fn user_index(&self, name: &str) -> Option<u32> {
        self.user_dict.get(name).copied()
    }

    pub fn item_index(&self, name: &str) -> Option<u32> {
        self.item_dict.get(name).copied()
    }

    /// Translates raw ratings into index-based triples. Ratings that refer to
    /// a user or an item unknown to this dictionary are silently dropped,
    /// which restricts held-out data to the entities seen during training.
    pub fn encode<'a, I>(&self, ratings: I) -> Ratings
    where
        I: Iterator<Item = &'a (String, String, f64)>,
    {
        ratings
            .filter_map(|(user, item, rating)| {
                match (self.user_index(user), self.item_index(item)) {
                    (Some(user_index), Some(item_index)) => {
                        Some((user_index, item_index, *rating))
                    },
                    _ => None,
                }
            })
            .collect()
    }
}

impl<'a, I> From<I> for DataDictionary
where
    I: Iterator<Item = &'a (String, String, f64)>,
{
    fn from(ratings: I) -> Self {

        let mut user_dict: FnvHashMap<String, u32> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut item_dict: FnvHashMap<String, u32> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut num_ratings: u64 = 0;

        for (user, item, _rating) in ratings {

            if !user_dict.contains_key(user) {
                user_dict.insert(user.clone(), user_dict.len() as u32);
            }

            if !item_dict.contains_key(item) {
                item_dict.insert(item.clone(), item_dict.len() as u32);
            }

            num_ratings += 1;
        }

        DataDictionary { user_dict, item_dict, num_ratings }
    }
}

/// Reverse mapping from dense indexes back to the original identifiers, used
/// when writing results keyed by the raw names.
pub struct Renaming {
    user_names: FnvHashMap<u32, String>,
    item_names: FnvHashMap<u32, String>,
}

impl Renaming {

    pub fn user_name(&self, user_index: u32) -> &str {
        &self.user_names[&user_index]
    }

    pub fn item_name(&self, item_index: u32) -> &str {
        &self.item_names[&item_index]
    }
}

impl From<DataDictionary> for Renaming {

    fn from(data_dict: DataDictionary) -> Self {

        let mut user_names: FnvHashMap<u32, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_users(), Default::default());

        let mut item_names: FnvHashMap<u32, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_items(), Default::default());

        for (user, user_index) in data_dict.user_dict.into_iter() {
            user_names.insert(user_index, user);
        }

        for (item, item_index) in data_dict.item_dict.into_iter() {
            item_names.insert(item_index, item);
        }

        Renaming { user_names, item_names }
    }
}

#[cfg(test)]
mod tests {

    use super::{DataDictionary, Renaming};

    fn ratings() -> Vec<(String, String, f64)> {
        vec![
            (String::from("alice"), String::from("apple"), 5.0),
            (String::from("bob"), String::from("apple"), 3.0),
            (String::from("alice"), String::from("pony"), 2.0),
            (String::from("charles"), String::from("bike"), 4.0),
        ]
    }

    #[test]
    fn indexes_are_assigned_in_first_occurrence_order() {
        let data_dict = DataDictionary::from(ratings().iter());

        assert_eq!(data_dict.num_users(), 3);
        assert_eq!(data_dict.num_items(), 3);
        assert_eq!(data_dict.num_ratings(), 4);

        assert_eq!(data_dict.user_index("alice"), Some(0));
        assert_eq!(data_dict.user_index("bob"), Some(1));
        assert_eq!(data_dict.user_index("charles"), Some(2));

        assert_eq!(data_dict.item_index("apple"), Some(0));
        assert_eq!(data_dict.item_index("pony"), Some(1));
        assert_eq!(data_dict.item_index("bike"), Some(2));
    }

    #[test]
    fn encoding_the_same_data_twice_is_deterministic() {
        let first = DataDictionary::from(ratings().iter());
        let second = DataDictionary::from(ratings().iter());

        assert_eq!(first.encode(ratings().iter()), second.encode(ratings().iter()));
    }

    #[test]
    fn encode_translates_with_the_training_indexes() {
        let data_dict = DataDictionary::from(ratings().iter());

        let encoded = data_dict.encode(ratings().iter());

        assert_eq!(encoded, vec![(0, 0, 5.0), (1, 0, 3.0), (0, 1, 2.0), (2, 2, 4.0)]);
    }

    #[test]
    fn ratings_of_unseen_users_and_items_are_dropped() {
        let data_dict = DataDictionary::from(ratings().iter());

        let heldout = vec![
            (String::from("alice"), String::from("apple"), 4.0),
            (String::from("dorothy"), String::from("apple"), 1.0),
            (String::from("bob"), String::from("helicopter"), 5.0),
        ];

        let encoded = data_dict.encode(heldout.iter());

        assert_eq!(encoded, vec![(0, 0, 4.0)]);
    }

    #[test]
    fn renaming_inverts_the_dictionary() {
        let data_dict = DataDictionary::from(ratings().iter());

        let renaming = Renaming::from(data_dict);

        assert_eq!(renaming.user_name(0), "alice");
        assert_eq!(renaming.user_name(2), "charles");
        assert_eq!(renaming.item_name(1), "pony");
    }
}
