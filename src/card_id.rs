use tracing::{debug, instrument};
use uuid::Uuid;

/// Creates the namespace UUID for a language pair, so the same sentence
/// studied from two pairs gets two identities
#[instrument]
pub fn create_pair_uuid(source_language: &str, target_language: &str) -> Uuid {
	debug!("Creating namespace for {} -> {}", source_language, target_language);

	let pair = format!("{}->{}", source_language.trim().to_lowercase(), target_language.trim().to_lowercase());
	Uuid::new_v5(&Uuid::NAMESPACE_OID, pair.as_bytes())
}

/// Generate a UUID for a card based on the term and its context. Editing the
/// surrounding text gives the card a new identity.
#[instrument(skip_all)]
pub fn generate_card_uuid(pair_uuid: &Uuid, before: &str, term: &str, after: &str) -> Uuid {
	let content = format!("{before}|{term}|{after}");
	Uuid::new_v5(pair_uuid, content.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_are_stable() {
		let pair = create_pair_uuid("English", "Bangla");
		assert_eq!(pair, create_pair_uuid(" english", "BANGLA "));
		assert_eq!(
			generate_card_uuid(&pair, "The ", "ami", " eat rice."),
			generate_card_uuid(&pair, "The ", "ami", " eat rice.")
		);
	}

	#[test]
	fn context_and_pair_change_the_id() {
		let bangla = create_pair_uuid("English", "Bangla");
		let hindi = create_pair_uuid("English", "Hindi");

		let id = generate_card_uuid(&bangla, "The ", "ami", " eat rice.");
		assert_ne!(id, generate_card_uuid(&bangla, "The ", "ami", " eat fish."));
		assert_ne!(id, generate_card_uuid(&hindi, "The ", "ami", " eat rice."));
	}
}
