pub mod bus;
pub mod ident;
pub mod notice;
pub mod rewards;
pub mod session;
pub mod store;

pub use bus::{EventBus, Subscription};
pub use notice::{Notice, Severity};
pub use rewards::RewardAction;
pub use session::{Identity, UserSession, short_address, SESSION_KEY};
pub use store::{MemoryStorage, SessionStorage, SessionStore};
