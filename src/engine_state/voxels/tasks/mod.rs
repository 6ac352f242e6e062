//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. These tasks
//! run on the task manager's worker threads to keep the calling thread free
//! while terrain is generated.

pub mod chunk_generation_task;
