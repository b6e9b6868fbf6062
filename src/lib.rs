#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_parsable as parsable;

pub use vc_parsable::{
    Category, Error, ErrorKind, Lifecycle, Parsable, ParsableEnum, ParsableExt, ParsableRegistry,
    ParseDriver, ParseMode, Result, SerializeDriver, Slot, Specialized, TableBuilder,
};
