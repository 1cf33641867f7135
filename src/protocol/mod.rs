/*!
 * Remote storage protocols
 *
 * Only the S3 protocol is implemented; it also covers S3-compatible
 * services such as MinIO or LocalStack through a custom endpoint.
 */

pub mod s3;
