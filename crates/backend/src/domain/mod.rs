pub mod a001_address_country;
pub mod a002_address_province;
pub mod a003_position;
pub mod a004_template_file;
pub mod a005_product_attribute;
pub mod a006_product_attribute_value;
pub mod a007_product_attribute_line;
pub mod a008_product_product;
