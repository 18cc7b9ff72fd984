//! Bevy adapter: mirrors a [`Resource`](crate::resource::Resource) into the
//! ECS so UI systems can read its state every frame.
//!
//! The resource's listener pushes each new state into a channel; an `Update`
//! system drains it into [`RemoteState`]. Systems that want to refetch or
//! change dependencies go through [`RemoteHandle`].

use crate::resource::{RequestState, Resource as Remote};
use bevy::prelude::*;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, channel};

pub struct RemoteResourcePlugin<D, T> {
    remote: Remote<D, T>,
}

impl<D, T> RemoteResourcePlugin<D, T> {
    /// The resource must have been created on a tokio runtime that outlives
    /// the app (see [`Remote::new_in`]).
    pub fn new(remote: Remote<D, T>) -> Self {
        Self { remote }
    }
}

impl<D, T> Plugin for RemoteResourcePlugin<D, T>
where
    D: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        let (tx, rx) = channel::<RequestState<T>>();
        let tx = Mutex::new(tx);
        self.remote.subscribe(move |state| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(state.clone());
            }
        });

        app.insert_resource(RemoteState {
            state: self.remote.get_state(),
        })
        .insert_resource(RemoteChannel(Mutex::new(rx)))
        .insert_resource(RemoteHandle {
            remote: self.remote.clone(),
        })
        .add_systems(Update, apply_remote_updates::<T>);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RemoteState<T: Send + Sync + 'static> {
    pub state: RequestState<T>,
}

#[derive(Resource)]
struct RemoteChannel<T: Send + Sync + 'static>(Mutex<Receiver<RequestState<T>>>);

#[derive(Resource)]
pub struct RemoteHandle<D: Send + Sync + 'static, T: Send + Sync + 'static> {
    remote: Remote<D, T>,
}

impl<D, T> RemoteHandle<D, T>
where
    D: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn refetch(&self) {
        let _ = self.remote.refetch();
    }

    pub fn set_deps(&self, deps: D) {
        let _ = self.remote.set_deps(deps);
    }

    pub fn deps(&self) -> D {
        self.remote.deps()
    }
}

fn apply_remote_updates<T: Clone + Send + Sync + 'static>(
    receiver: Res<RemoteChannel<T>>,
    mut remote: ResMut<RemoteState<T>>,
) {
    if let Ok(rx) = receiver.0.lock() {
        while let Ok(state) = rx.try_recv() {
            remote.state = state;
        }
    }
}
