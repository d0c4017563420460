//! xsearch: grouped search expressions on the command line
//!
//! The search forms of a catalogue keep their query as a tree of groups: terms such as
//! `year>='1450'` joined by AND or OR, nested where the two mix. xsearch parses the RSQL form
//! of such a tree, shows it as a tree or as the readable preview the form displays, applies the
//! same add, remove and update edits the form offers, and converts between expressions and the
//! deep links that carry them.
//!
//! The field registry and labels come from `.xsearch.toml` files, discovered from the current
//! directory upward and merged with `~/.xsearch.toml`.

#![warn(missing_docs)]
