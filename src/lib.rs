#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use pm_marshal as marshal;
pub use pm_utils as utils;
