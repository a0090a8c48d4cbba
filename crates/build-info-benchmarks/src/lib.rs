//! Smoke benchmarks for the render/persist loop live in `tests/`.
