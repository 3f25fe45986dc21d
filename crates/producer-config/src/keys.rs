//! Property keys and fixed values.

pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";
pub const SCHEMA_REGISTRY_URL: &str = "schema.registry.url";
pub const ACKS: &str = "acks";
pub const RETRIES: &str = "retries";
pub const KEY_SERIALIZER: &str = "key.serializer";
pub const VALUE_SERIALIZER: &str = "value.serializer";
pub const VALUE_SUBJECT_NAME_STRATEGY: &str = "value.subject.name.strategy";
pub const SECURITY_PROTOCOL: &str = "security.protocol";

pub const SSL_TRUSTSTORE_LOCATION: &str = "ssl.truststore.location";
pub const SSL_TRUSTSTORE_PASSWORD: &str = "ssl.truststore.password";
pub const SSL_TRUSTSTORE_TYPE: &str = "ssl.truststore.type";
pub const SSL_KEYSTORE_LOCATION: &str = "ssl.keystore.location";
pub const SSL_KEYSTORE_PASSWORD: &str = "ssl.keystore.password";
pub const SSL_KEYSTORE_TYPE: &str = "ssl.keystore.type";

// Registration flags read by the codec, named as the Confluent serializer names them.
pub const AUTO_REGISTER_SCHEMAS: &str = "auto.register.schemas";
pub const USE_SCHEMA_ID: &str = "use.schema.id";
pub const ID_COMPATIBILITY_STRICT: &str = "id.compatibility.strict";
pub const USE_LATEST_VERSION: &str = "use.latest.version";
pub const LATEST_COMPATIBILITY_STRICT: &str = "latest.compatibility.strict";
pub const NORMALIZE_SCHEMAS: &str = "normalize.schemas";

// Registry authentication.
pub const BASIC_AUTH_CREDENTIALS_SOURCE: &str = "basic.auth.credentials.source";
pub const BASIC_AUTH_USER_INFO: &str = "basic.auth.user.info";

pub const ACKS_ALL: &str = "all";
pub const NO_RETRIES: &str = "0";
pub const STRING_ENCODER: &str = "utf8-string";
pub const SCHEMA_REGISTRATION_CODEC: &str = "schema-registration-codec";
pub const PROTOCOL_SSL: &str = "SSL";
pub const PROTOCOL_PLAINTEXT: &str = "PLAINTEXT";
pub const STORE_TYPE_PKCS12: &str = "PKCS12";

/// Path of the Confluent-compatible API under the registry base URL.
pub const CONFLUENT_COMPAT_PATH: &str = "/apis/ccompat/v6";

/// Keys consumed on the client side; the broker client never sees them.
pub const CLIENT_SIDE_KEYS: &[&str] = &[
    SCHEMA_REGISTRY_URL,
    KEY_SERIALIZER,
    VALUE_SERIALIZER,
    VALUE_SUBJECT_NAME_STRATEGY,
    AUTO_REGISTER_SCHEMAS,
    USE_SCHEMA_ID,
    ID_COMPATIBILITY_STRICT,
    USE_LATEST_VERSION,
    LATEST_COMPATIBILITY_STRICT,
    NORMALIZE_SCHEMAS,
    BASIC_AUTH_CREDENTIALS_SOURCE,
    BASIC_AUTH_USER_INFO,
];
