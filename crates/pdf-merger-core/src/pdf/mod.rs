mod accumulator;
mod document;

pub use accumulator::OutputAccumulator;
pub use document::ParsedDocument;
