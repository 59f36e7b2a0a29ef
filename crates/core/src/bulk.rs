// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Pairs shifts with workers round-robin: shift `i` gets worker `i mod n`.
///
/// Returns `(shift_id, worker_id)` pairs in shift order; empty if there are
/// no workers.
#[must_use]
pub fn plan_round_robin(worker_ids: &[i64], shift_ids: &[i64]) -> Vec<(i64, i64)> {
    if worker_ids.is_empty() {
        return Vec::new();
    }
    shift_ids
        .iter()
        .zip(worker_ids.iter().cycle())
        .map(|(shift_id, worker_id)| (*shift_id, *worker_id))
        .collect()
}
