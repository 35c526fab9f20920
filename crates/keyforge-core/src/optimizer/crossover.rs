use fastrand::Rng;

// Optimized Uniform Crossover (UOX)
pub fn crossover_uniform(
    p1: &[u16],
    p2: &[u16],
    pinned: &[Option<u16>],
    rng: &mut Rng,
) -> Vec<u16> {
    let len = p1.len();
    let mut child = vec![0u16; len];
    let mut filled = vec![false; len];

    // 1. Apply Pins
    for (i, &pin) in pinned.iter().enumerate() {
        if i < len {
            if let Some(val) = pin {
                child[i] = val;
                filled[i] = true;
            }
        }
    }

    // 2. Build Frequency Table
    let mut needed: Vec<(u16, u8)> = Vec::with_capacity(len);

    for &code in p1 {
        if let Some(entry) = needed.iter_mut().find(|(c, _)| *c == code) {
            entry.1 += 1;
        } else {
            needed.push((code, 1));
        }
    }

    for (i, &is_f) in filled.iter().enumerate() {
        if is_f {
            let code = child[i];
            if let Some(entry) = needed.iter_mut().find(|(c, _)| *c == code) {
                if entry.1 > 0 {
                    entry.1 -= 1;
                }
            }
        }
    }

    // 3. Inherit from P1
    for i in 0..len {
        if !filled[i] && rng.bool() {
            let gene = p1[i];
            if let Some(entry) = needed.iter_mut().find(|(c, _)| *c == gene) {
                if entry.1 > 0 {
                    child[i] = gene;
                    filled[i] = true;
                    entry.1 -= 1;
                }
            }
        }
    }

    // 4. Fill gaps from P2
    let mut p2_idx = 0;
    for i in 0..len {
        if !filled[i] {
            while p2_idx < len {
                let gene = p2[p2_idx];
                p2_idx += 1;

                if let Some(entry) = needed.iter_mut().find(|(c, _)| *c == gene) {
                    if entry.1 > 0 {
                        child[i] = gene;
                        filled[i] = true;
                        entry.1 -= 1;
                        break;
                    }
                }
            }
        }
    }

    // 5. Emergency Fallback
    for i in 0..len {
        if !filled[i] {
            child[i] = 0;
        }
    }

    child
}
