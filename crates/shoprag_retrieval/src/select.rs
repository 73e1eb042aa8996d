//! Passage filtering and prompt rendering.

use shoprag_core::Passage;

/// Keeps passages scoring at least `min_score`, best first, at most `top_k`.
///
/// Passages with equal scores keep their input order.
pub fn select_passages(passages: Vec<Passage>, min_score: f32, top_k: usize) -> Vec<Passage> {
    let mut selected: Vec<Passage> = passages
        .into_iter()
        .filter(|p| *p.score() >= min_score)
        .collect();
    selected.sort_by(|a, b| b.score().total_cmp(a.score()));
    selected.truncate(top_k);
    selected
}

/// Renders passages as numbered blocks separated by blank lines.
///
/// # Examples
///
/// ```
/// use shoprag_core::Passage;
/// use shoprag_retrieval::format_context;
///
/// let passages = vec![
///     Passage::new("c1", "Доставка занимает 3 дня.", "faq", ""),
///     Passage::new("c2", "Возврат в течение 14 дней.", "faq", ""),
/// ];
///
/// assert_eq!(
///     format_context(&passages),
///     "[1] Доставка занимает 3 дня.\n\n[2] Возврат в течение 14 дней."
/// );
/// assert_eq!(format_context(&[]), "");
/// ```
pub fn format_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {}", i + 1, p.text()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
