//! Grounding prompt assembly.
//!
//! Renders retrieved chunks plus the question into a single user prompt,
//! paired with a fixed system instruction. The system instruction travels
//! as its own chat message and is never concatenated into the user prompt.

use crate::models::Chunk;

/// Fixed system instruction: Dutch, documents-only, no internet.
pub const SYSTEM_INSTRUCTION: &str = "\
Deze GPT is bedoeld om inwoners van Rotterdam op een toegankelijke en betrouwbare manier te informeren over de haven. \
Hij helpt mensen om plannen, beleid en ontwikkelingen in en rond de haven beter te begrijpen en te plaatsen in hun dagelijks leven. \
Bedrijven en beleidsmakers kunnen ook vragen stellen, maar de toon en uitleg zijn in eerste instantie gericht op burgers.

De GPT gebruikt uitsluitend de documenten die aan deze GPT zijn toegevoegd en zoekt nooit informatie op internet. \
Als informatie ontbreekt, zeg dat eerlijk en help de gebruiker verder met een gerichte vervolgvraag of toelichting. \
Alleen wanneer er in de beschikbare documenten iets staat dat kan helpen, geef dat door.

Toon: menselijk, vriendelijk, deskundig — alsof je met een goed geïnformeerde buur praat die rustig uitlegt. \
Pas de toon aan: nuchter en feitelijk bij beleidsvragen; persoonlijker bij vragen van inwoners.

Antwoorden zijn:
- Duidelijk en feitelijk, met uitleg van begrippen en context.
- Evenwichtig: benoem zowel voordelen als aandachtspunten.
- Respectvol en betrokken.
- In verzorgd, begrijpelijk Nederlands zonder onnodig jargon.

Denk mee over praktische gevolgen, corrigeer misverstanden waar nodig, en help gebruikers om beleidsstukken en plannen te begrijpen. \
Als iemand doorvraagt en de informatie is beschikbaar in de documenten, deel die begrijpelijk. \
Beperk je tot de aangeleverde documenten (context) en vermeld het als iets niet in de bronnen staat.";

/// Deterministic answer when the index holds no documents; returned
/// without any remote call.
pub const NO_DOCUMENTS_ANSWER: &str =
    "Ik heb nog geen documenten om op te zoeken. Voeg eerst pdf's of teksten toe.";

/// Fallback when the model returns empty content.
pub const EMPTY_ANSWER_FALLBACK: &str = "Geen antwoord";

/// Render retrieved chunks and the question into one grounding prompt.
///
/// Each context chunk becomes a numbered block with its source label
/// (title, falling back to the origin locator), followed by the question
/// and an explicit instruction to answer only from the supplied context.
pub fn build_prompt(question: &str, contexts: &[&Chunk]) -> String {
    let blocks: Vec<String> = contexts
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[#{}] Bron: {}\n{}", i + 1, c.label(), c.text))
        .collect();

    format!(
        "Context uit documenten:\n\n{}\n\nVraag: {}\n\nAntwoord in het Nederlands volgens de instructie. Verwijs niet naar externe bronnen.",
        blocks.join("\n\n"),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str, title: Option<&str>, text: &str) -> Chunk {
        Chunk {
            id: format!("{}#0", source),
            doc_id: source.to_string(),
            source: source.to_string(),
            title: title.map(|t| t.to_string()),
            text: text.to_string(),
            embedding: None,
        }
    }

    #[test]
    fn numbers_context_blocks_in_order() {
        let a = chunk("plan.pdf", None, "Eerste stuk.");
        let b = chunk("nota.pdf", None, "Tweede stuk.");
        let prompt = build_prompt("Wat staat er?", &[&a, &b]);
        assert!(prompt.contains("[#1] Bron: plan.pdf\nEerste stuk."));
        assert!(prompt.contains("[#2] Bron: nota.pdf\nTweede stuk."));
        assert!(prompt.find("[#1]").unwrap() < prompt.find("[#2]").unwrap());
    }

    #[test]
    fn title_is_preferred_over_source() {
        let c = chunk("https://example.com/x.pdf", Some("Havenvisie"), "Inhoud.");
        let prompt = build_prompt("Vraag?", &[&c]);
        assert!(prompt.contains("Bron: Havenvisie"));
        assert!(!prompt.contains("Bron: https://example.com/x.pdf"));
    }

    #[test]
    fn question_and_grounding_instruction_are_present() {
        let c = chunk("doc", None, "tekst");
        let prompt = build_prompt("Wat is Porthos?", &[&c]);
        assert!(prompt.contains("Vraag: Wat is Porthos?"));
        assert!(prompt.contains("Verwijs niet naar externe bronnen."));
    }

    #[test]
    fn system_instruction_is_not_part_of_the_prompt() {
        let c = chunk("doc", None, "tekst");
        let prompt = build_prompt("Vraag?", &[&c]);
        assert!(!prompt.contains("Deze GPT is bedoeld"));
    }
}
