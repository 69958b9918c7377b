/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines diagnostic messages and sinks for recoverable numerical issues during basis fitting.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Diagnostic reporting primitives for basis construction.
//!
//! Recoverable conditions never stop a construction. They are always logged through
//! the [`log`] facade and, when a sink is attached to the builder, forwarded to it.

use std::fmt::Debug;
use std::sync::{Arc, mpsc};
use std::thread;

/// Least-squares system that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    /// `(AᵀA) w = Aᵀ rhs`.
    Unconstrained,

    /// `(LᵀAᵀA L) v = LᵀAᵀ b`.
    ConstraintReduced,
}

/// Diagnostic events emitted while fitting an element basis.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticMsg {
    /// The symmetric normal-equation factorization hit a numerical issue and the
    /// solve fell back to a pivoted indefinite factorization.
    IllConditionedFit { stage: SolveStage, size: usize },

    /// Mean over bases of the maximum absolute sample residual.
    FitResidual { mean_max_residual: f64 },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes diagnostic messages.
pub trait DiagnosticSink: Send + Sync + Debug {
    fn emit(&self, msg: DiagnosticMsg);
}

/// Diagnostic sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<DiagnosticMsg>,
}

impl DiagnosticSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: DiagnosticMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each diagnostic message.
///
/// The thread exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn DiagnosticSink>, thread::JoinHandle<()>)
where
    F: FnMut(DiagnosticMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<DiagnosticMsg>(buffer.max(1));
    let sink: Arc<dyn DiagnosticSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Logs `msg` at the level matching its severity and forwards it to `sink`.
pub(crate) fn report(sink: Option<&Arc<dyn DiagnosticSink>>, msg: DiagnosticMsg) {
    match &msg {
        DiagnosticMsg::IllConditionedFit { stage, size } => {
            log::warn!(
                "numerical issues when solving the {:?} least-squares system of size {}x{}",
                stage,
                size,
                size
            );
        }
        DiagnosticMsg::FitResidual { mean_max_residual } => {
            log::debug!("mean residual: {:e}", mean_max_residual);
        }
        DiagnosticMsg::Message { message } => log::trace!("{}", message),
    }

    if let Some(sink) = sink {
        sink.emit(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closure_sink_forwards_messages() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let store = received.clone();

        let (sink, handle) = closure_sink(8, move |msg| store.lock().unwrap().push(msg));

        report(
            Some(&sink),
            DiagnosticMsg::IllConditionedFit {
                stage: SolveStage::ConstraintReduced,
                size: 5,
            },
        );
        report(Some(&sink), DiagnosticMsg::FitResidual { mean_max_residual: 0.5 });

        drop(sink);
        handle.join().unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(
            received[0],
            DiagnosticMsg::IllConditionedFit {
                stage: SolveStage::ConstraintReduced,
                size: 5
            }
        );
    }

    #[test]
    fn report_without_sink_is_a_no_op() {
        report(
            None,
            DiagnosticMsg::Message {
                message: "nothing listening".to_string(),
            },
        );
    }
}
