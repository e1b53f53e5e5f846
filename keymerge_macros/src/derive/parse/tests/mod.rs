//! Unit tests for `KeyMerge` derive input parsing.

mod keymerge_attrs;
