use jp_content_analyzer::analysis::{render_translation_prompt, render_vocabulary_prompt};

#[test]
fn translation_prompt_snapshot() {
    let prompt = render_translation_prompt("こんにちは", "Thai").unwrap();
    insta::assert_snapshot!(prompt, @r"
    Translate the following text from Japanese into Thai.
    Return only the translated text, with no commentary.

    Text:
    こんにちは
    ");
}

#[test]
fn vocabulary_prompt_snapshot() {
    let prompt = render_vocabulary_prompt("こんにちは", "Thai").unwrap();
    insta::assert_snapshot!(prompt, @r"
    From the text below, collect as many vocabulary words as possible at JLPT
    difficulty levels N3, N2 and N1, organized as a table per difficulty level
    (N3, N2, N1). Each entry must consist of:
    1. the word
    2. the reading (hiragana, with romaji in parentheses)
    3. the meaning in Thai
    4. an example sentence using the word (with a Thai translation of the sentence)

    Text:
    こんにちは
    ");
}
