// In: src/record/macros.rs

/// Declares a struct and implements `TaggedRecord` for it.
///
/// Every field carries an `#[arrow(...)]` attribute with string-literal
/// options: `name` (column name), `index` (column position) and
/// `arrow_type` (explicit logical type). A field without the attribute
/// still compiles but makes `RecordLayout::compile` fail with `InvalidTag`.
///
/// # Example
/// ```
/// use arrowconv::arrow_record;
/// use chrono::NaiveDate;
///
/// arrow_record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Order {
///         #[arrow(name = "id")]
///         pub id: i32,
///         #[arrow(name = "note")]
///         pub note: Option<String>,
///         #[arrow(name = "placed", arrow_type = "date32")]
///         pub placed: NaiveDate,
///     }
/// }
/// ```
#[macro_export]
macro_rules! arrow_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[arrow($($key:ident = $val:literal),* $(,)?)])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field : $ty ),*
        }

        impl $crate::record::TaggedRecord for $name {
            fn field_decls() -> ::std::vec::Vec<$crate::record::FieldDecl<Self>> {
                ::std::vec![
                    $(
                        $crate::record::FieldDecl {
                            field_name: ::std::stringify!($field),
                            tag: &[ $($( (::std::stringify!($key), $val) ),*)? ],
                            declared: <$ty as $crate::record::ArrowNative>::DECLARED,
                            nullable: <$ty as $crate::record::ArrowNative>::NULLABLE,
                            getter: |record: &$name| {
                                $crate::record::ArrowNative::to_value(&record.$field)
                            },
                            setter: |record: &mut $name, value: $crate::value::Value| {
                                record.$field = <$ty as $crate::record::ArrowNative>::from_value(value)?;
                                ::std::result::Result::Ok(())
                            },
                        }
                    ),*
                ]
            }
        }
    };
}
