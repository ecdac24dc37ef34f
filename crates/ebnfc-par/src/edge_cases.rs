//! End-to-end scenarios for the grammar compiler and combinator engine.
