//! Cross-component scenario tests.
//!
//! Every test wires real in-memory adapters and the in-process session hub:
//! one authority and one player sharing an actor store and a chat log, each
//! with its own chat view.
//!
//! ```bash
//! cargo test -p veilkeep-engine --lib e2e_tests
//! ```

mod reveal_flow_tests;
