//! The format-pattern DSL.
//!
//! A pattern string such as `dd/MM/yyyy HH:mm:ss` goes through three stages:
//!
//! ```text
//! "dd/MM/yyyy"
//!      │  tokenize                       (tokenizer.rs)
//!      v
//! TokenSequence [Day{2}, '/', MonthNumeric{2}, '/', Year4]
//!      │  ResolvedPattern::new + LocaleFacts  (resolved.rs)
//!      v
//! ResolvedPattern
//!   - offsets, separators, zone shape, PatternType
//!   - parse / extract / is_valid         (consume.rs)
//!   - regexp / matcher                   (regexp.rs)
//! ```
//!
//! ## Letters
//!
//! | letters          | meaning                                   |
//! |------------------|-------------------------------------------|
//! | `yyyy` `yy`      | year                                      |
//! | `M` `MM`         | numeric month                             |
//! | `MMM` `MMMM`     | abbreviated / full month name             |
//! | `d` `dd`         | day of month                              |
//! | `?` `??`         | numeric date field of unknown role        |
//! | `H` `HH`         | hour 0-23                                 |
//! | `h` `hh`         | hour 1-12                                 |
//! | `k` `kk`         | hour 1-24                                 |
//! | `mm` `ss`        | minute, second                            |
//! | `SSS` `S{m,n}`   | fraction of second                        |
//! | `x`..`xxxxx`     | numeric offset                            |
//! | `X`..`XXXXX`     | numeric offset or `Z`                     |
//! | `z`              | zone name                                 |
//! | `O` `OOOO`       | `GMT+8` / `GMT+08:00`                     |
//! | `a` / `P`        | localized / fixed AM-PM                   |
//! | `EEE` `EEEE`     | abbreviated / full day of week            |
//! | `G`              | era                                       |
//! | `p`              | space pad for the next `d`, `H` or `h`    |
//! | `'...'`          | quoted literal, `''` is a single quote    |

#[path = "pattern/consume.rs"]
mod consume;
#[path = "pattern/regexp.rs"]
mod regexp;
#[path = "pattern/resolved.rs"]
mod resolved;
#[path = "pattern/token.rs"]
mod token;
#[path = "pattern/tokenizer.rs"]
mod tokenizer;

pub use consume::ParsedValue;
pub use resolved::{DateField, DateRole, PatternType, ResolvedPattern, TimeZoneShape};
pub use token::{FormatToken, PatternItem, TokenSequence};
pub use tokenizer::tokenize;
