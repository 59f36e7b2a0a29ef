// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates connection setup, migration execution, and the
//! handful of helpers that cannot be expressed in Diesel DSL (PRAGMA
//! statements, `last_insert_rowid()`).
//!
//! All domain queries and mutations live in `queries/` and `mutations/`.

pub mod sqlite;
