pub mod console;
pub mod state;
pub mod suite;
pub mod tester;

pub use state::*;
pub use suite::TestGroup;
pub use tester::ApiTester;
