use anyhow::{Context, Result};
use std::thread;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs load work out of band. Results come back through the controller inbox.
///
/// An error means the job was dropped without running, so no result will
/// ever arrive for it.
pub trait Spawn {
    fn spawn(&self, name: &str, job: Job) -> Result<()>;
}

pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, name: &str, job: Job) -> Result<()> {
        thread::Builder::new()
            .name(format!("skinamp-{name}"))
            .spawn(job)
            .with_context(|| format!("Could not start {name} worker"))?;

        Ok(())
    }
}
