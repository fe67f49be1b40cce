/// Prefix of an extracted fragment up to and including its delimiter.
/// Example: `if (x > <NUM_LIT>) {`
pub type Signature = String;
/// Remainder of an extracted fragment after the delimiter.
/// Example: `y = <NUM_LIT> }`
pub type Body = String;
/// Raw Kotlin source text.
/// Example: `fun main() { println("hi") }`
pub type SourceText = String;
/// Remote location of a source file or JSONL corpus.
/// Example: `https://raw.githubusercontent.com/JetBrains/kotlin/master/build.gradle.kts`
pub type Url = String;
/// Corpus file name (no directory).
/// Example: `loop_tasks.jsonl`
pub type FileName = String;
/// Regular expression source text as written in a catalog.
/// Example: `for\s*\([^{}\n]*?\)\s*\{[^{}]*}`
pub type PatternSource = std::borrow::Cow<'static, str>;
