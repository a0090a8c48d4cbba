//! Contract fixtures for the persisted draft live under `contracts/`; the
//! checks are in `tests/`.
