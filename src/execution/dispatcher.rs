use crate::Call;
use ethers::types::{Address, Bytes};
use std::collections::{HashMap, HashSet};

/// Delivers a forwarded call to its destination.
///
/// `Err` carries the raw return data of a failed call. A dispatcher only
/// sees the call itself, never the account that sent it.
///
/// Effects of dispatched calls stay pending until the gateway calls
/// `commit`; `discard` drops everything dispatched since the last commit.
pub trait CallDispatcher: Send {
    fn dispatch(&mut self, call: &Call) -> Result<Bytes, Bytes>;
    
    fn commit(&mut self) {}
    
    fn discard(&mut self) {}
}

/// In-process dispatcher that keeps every delivered call
///
/// Destinations registered with `revert_with` fail with the given data and
/// record nothing. Successful calls become visible through `received` only
/// once committed.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    /// Committed calls per destination
    delivered: HashMap<Address, Vec<Call>>,
    /// Calls dispatched since the last commit, in order
    pending: Vec<Call>,
    /// Destinations that fail, with the raw data they return
    reverting: HashMap<Address, Bytes>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn revert_with(mut self, destination: Address, data: Bytes) -> Self {
        self.reverting.insert(destination, data);
        self
    }
    
    /// Every destination in `destinations` reverts with empty data
    pub fn with_reverting(destinations: &HashSet<Address>) -> Self {
        destinations
            .iter()
            .fold(Self::new(), |dispatcher, destination| {
                dispatcher.revert_with(*destination, Bytes::default())
            })
    }
    
    pub fn received(&self, destination: Address) -> &[Call] {
        self.delivered
            .get(&destination)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl CallDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, call: &Call) -> Result<Bytes, Bytes> {
        if let Some(data) = self.reverting.get(&call.destination) {
            return Err(data.clone());
        }
        
        self.pending.push(call.clone());
        Ok(Bytes::default())
    }
    
    fn commit(&mut self) {
        for call in self.pending.drain(..) {
            self.delivered
                .entry(call.destination)
                .or_default()
                .push(call);
        }
    }
    
    fn discard(&mut self) {
        self.pending.clear();
    }
}
