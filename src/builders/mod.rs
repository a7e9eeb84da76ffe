// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules hold the per-tool building blocks the engine
// composes.

// `classifier` module:
// Reads the PE header of an executable to tell 64-bit launchers apart, and
// derives the display label and installer guard from it.
pub mod classifier;

// `fragments` module:
// The fixed Inno Setup line templates for the `[Components]`, `[Files]` and
// `[Icons]` entries.
pub mod fragments;

// `reporter` module:
// The `Diagnostic` events raised during a run and the reporters that surface
// them (colored console output, or an in-memory log for tests).
pub mod reporter;

// `resolver` module:
// The core of the generator: decides which executables or packaged
// applications of a tool folder become launchers, descending into
// sub-folders when a folder has none.
pub mod resolver;

// `sanitizer` module:
// Normalizes labels into the identifier-safe tokens used in component names.
pub mod sanitizer;

// `unpacker` module:
// Extracts the `.7z` bundles found in tool folders, honoring the denylist.
pub mod unpacker;

// `validator` module:
// Sanity checks for a rule tables file.
pub mod validator;

// `writer` module:
// Persists each category's lines as a section file.
pub mod writer;
