// ===== keyforge/crates/keyforge-core/src/optimizer/initialization.rs =====
use crate::core_types::Layout;
use crate::scorer::Scorer;
use fastrand::Rng;
use std::collections::HashSet;

pub fn generate_greedy_layout(scorer: &Scorer, rng: &mut Rng, pinned: &[Option<u16>]) -> Layout {
    let key_count = scorer.key_count;
    let mut layout = vec![0u16; key_count];
    let mut filled = vec![false; key_count];
    let mut used_chars = HashSet::new();

    for (i, &p) in pinned.iter().enumerate() {
        if i < key_count {
            if let Some(c) = p {
                layout[i] = c;
                filled[i] = true;
                used_chars.insert(c);
            }
        }
    }

    let mut ranked_slots: Vec<(usize, f32)> = (0..key_count)
        .filter(|&i| !filled[i])
        .map(|i| {
            let cost = scorer.slot_monogram_costs[i];
            (i, cost + rng.f32() * 0.1)
        })
        .collect();

    ranked_slots.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let mut ranked_chars: Vec<(u16, f32)> = scorer
        .active_chars
        .iter()
        .map(|&idx| {
            let c = idx as u16;
            (c, scorer.char_freqs[idx])
        })
        .filter(|(c, _)| !used_chars.contains(c))
        .collect();

    ranked_chars.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let mut char_iter = ranked_chars.into_iter();

    for (slot_idx, _) in ranked_slots {
        if let Some((char_code, _)) = char_iter.next() {
            layout[slot_idx] = char_code;
        } else {
            layout[slot_idx] = 0;
        }
    }

    layout
}
