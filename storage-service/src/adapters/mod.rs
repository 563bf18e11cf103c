// SPDX-License-Identifier: GPL-3.0-only

//! Driver implementations compiled into the service

pub mod mock;
