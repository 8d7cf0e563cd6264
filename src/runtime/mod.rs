//=====================================================
// File: runtime/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript runtime data model
// Objective: Re-export values and the global variable table
//=====================================================

pub mod value;
pub mod variables;

pub use value::Value;
pub use variables::VariableStore;
