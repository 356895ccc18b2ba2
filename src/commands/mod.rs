// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod budgets;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod link;
pub mod recurring;
pub mod reports;
pub mod reset;
pub mod sync;
pub mod theme;
pub mod transactions;
