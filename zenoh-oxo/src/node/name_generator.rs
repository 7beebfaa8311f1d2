/// Random room names for operators who do not pick one
use markov_namegen::{CharacterChainGenerator, RandomTextGenerator};

/// Place names used as training data, so rooms sound like somewhere to meet
const TRAINING_PLACES: &[&str] = &[
    "Avalon", "Camelot", "Lyonesse", "Tintagel", "Carbonek", "Broceliande",
    "Arden", "Elsinore", "Illyria", "Verona", "Arcadia", "Ithaca",
    "Delos", "Tarsis", "Olympia", "Corinth", "Thule", "Hyperborea",
    "Ys", "Tirnanog", "Emain", "Tara", "Mag", "Annwn",
    "Asgard", "Vanaheim", "Midgard", "Jotunheim", "Alfheim", "Bifrost",
    "Harrow", "Fenwick", "Marsh", "Hollow", "Brook", "Dale",
    "Glen", "Moor", "Ford", "Heath", "Crag", "Tor",
];

fn create_name_generator() -> CharacterChainGenerator {
    CharacterChainGenerator::builder()
        .with_order(2)
        .with_prior(0.01)
        .train(TRAINING_PLACES.iter().copied())
        .build()
}

/// Generate a pronounceable room name of 2..=12 alphanumeric characters
pub(crate) fn generate_random_name() -> String {
    let mut generator = create_name_generator();

    loop {
        let name = generator.generate_one();
        if name.len() >= 2 && name.len() <= 12 && name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return name;
        }
    }
}

/// Generate a room name with a numeric suffix, like "Tarden_417"
///
/// The suffix makes it unlikely that two operators who both let the
/// program choose end up in the same room.
pub(crate) fn generate_unique_name() -> String {
    let base_name = generate_random_name();
    let suffix: u16 = rand::random::<u16>() % 1000;
    format!("{}_{}", base_name, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_name() {
        let name = generate_random_name();
        assert!(name.len() >= 2 && name.len() <= 12);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_unique_name_format() {
        let name = generate_unique_name();
        let (base, suffix) = name.split_once('_').unwrap();
        assert!(base.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(suffix.parse::<u16>().unwrap() < 1000);
    }
}
