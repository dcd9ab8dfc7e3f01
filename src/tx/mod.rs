//! Transfer dispatch: native deposits, router deposits and plain transfers

mod dispatcher;

pub use dispatcher::{route, Route, TransferDispatcher, TransferIntent};
