//! Core data model shared by the guard compiler and the machine driver.
//!
//! This module contains:
//! - The condition table (named `set`/`pulse` flags)
//! - The expression pool and its evaluator
//! - States, transitions and lifecycle callbacks
//! - Transition history records

mod condition;
mod expression;
mod history;
mod state;

pub use condition::{Condition, ConditionId, ConditionTable};
pub use expression::{Expr, ExprId, ExprPool};
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{Action, State, StateHandle, StateId, TickAction, Transition};
