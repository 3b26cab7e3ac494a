// End-to-end integration tests for the Healthwire API
//
// These tests use a shared testcontainers PostgreSQL instance. Each test gets
// its own database, copied from a migrated template, so tests run in parallel
// without conflicts.
//
// Architecture:
// - One shared PostgreSQL container for the entire test suite
// - Migrations run once into a template database
// - Each test gets a test_db_<uuid> copy in setup and drops it in teardown
// - Outlets are served by an in-process stub, so no test touches the network
//
// Tests run in parallel by default, significantly improving test performance.

mod test_health;
mod test_sources;
