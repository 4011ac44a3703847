//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use battle::BattleHandle;

/// Frontend abstraction for UI layers.
///
/// Frontends talk to the battle controller through a [`BattleHandle`]:
/// - watch the published `BattleView`
/// - request attacks
///
/// Frontends do NOT own the controller; the composition root shuts it down
/// after `run` returns.
///
/// # Example Implementation
///
/// ```no_run
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use battle::BattleHandle;
/// use client_frontend_core::Frontend;
///
/// struct Headless;
///
/// #[async_trait]
/// impl Frontend for Headless {
///     async fn run(&mut self, handle: BattleHandle) -> Result<()> {
///         let mut views = handle.watch();
///         handle.request_attack()?;
///         while views.changed().await.is_ok() {
///             println!("{:?}", views.borrow().phase);
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend event loop until the operator quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend encounters a fatal error.
    async fn run(&mut self, handle: BattleHandle) -> Result<()>;
}
