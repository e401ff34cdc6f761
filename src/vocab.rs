//! Namespace constants for the vocabulary this crate recognises.
//!
//! Grouped the way `oxrdf::vocab` groups `rdf`/`rdfs`/`shacl`/`xsd`: one
//! module per namespace, one `pub const` per term used by the engine.

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
}

pub mod sh {
    pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
    pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
    pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
    pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
    pub const NAME: &str = "http://www.w3.org/ns/shacl#name";
    pub const DESCRIPTION: &str = "http://www.w3.org/ns/shacl#description";
    pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";
    pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
    pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
    pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
    pub const ALTERNATIVE_PATH: &str = "http://www.w3.org/ns/shacl#alternativePath";
    pub const INVERSE_PATH: &str = "http://www.w3.org/ns/shacl#inversePath";
    pub const ZERO_OR_MORE_PATH: &str = "http://www.w3.org/ns/shacl#zeroOrMorePath";
    pub const ONE_OR_MORE_PATH: &str = "http://www.w3.org/ns/shacl#oneOrMorePath";
    pub const ZERO_OR_ONE_PATH: &str = "http://www.w3.org/ns/shacl#zeroOrOnePath";
}

pub mod xsd {
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
    /// Non-standard shorthand datatype accepted by this engine alongside `anyURI`.
    pub const IRI: &str = "http://www.w3.org/2001/XMLSchema#iri";
}

/// The `https://w3id.org/rdf-lens/ontology#` namespace.
pub mod rdfl {
    pub const CBD: &str = "https://w3id.org/rdf-lens/ontology#CBD";
    pub const PATH_LENS: &str = "https://w3id.org/rdf-lens/ontology#PathLens";
    pub const CONTEXT: &str = "https://w3id.org/rdf-lens/ontology#Context";
    pub const TYPED_EXTRACT: &str = "https://w3id.org/rdf-lens/ontology#TypedExtract";
    pub const ENV_VARIABLE: &str = "https://w3id.org/rdf-lens/ontology#EnvVariable";
    pub const ENV_KEY: &str = "https://w3id.org/rdf-lens/ontology#envKey";
    pub const ENV_DEFAULT: &str = "https://w3id.org/rdf-lens/ontology#envDefault";
    pub const DATATYPE: &str = "https://w3id.org/rdf-lens/ontology#datatype";
}
