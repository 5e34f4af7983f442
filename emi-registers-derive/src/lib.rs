//! Macros to `derive` the `emi-registers` traits

use proc_macro::TokenStream;
use quote::quote;

mod entry;
mod mapping;
mod utils;

/// Derive macro to implement `emi_registers::core::InputRegisterMap`
#[proc_macro_derive(InputRegisterMap, attributes(emi))]
pub fn derive_input_register_map(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);

    let name = &ast.ident;

    let mapping = mapping::Mapping::new(&ast);
    let field_name = mapping.field_name_vec();
    let decode = mapping.decode_expr_vec();

    let tokens = quote! {
        #[async_trait::async_trait]
        impl emi_registers::core::InputRegisterMap for #name {
            async fn update_from_input_registers(
                &mut self,
                transport: &mut dyn emi_registers::transport::RegisterTransport,
            ) -> Result<(), emi_registers::error::DecodeError> {
                #(
                    // Read, decode and set
                    self.#field_name = #decode;
                )*
                Ok(())
            }
        }
    };

    tokens.into()
}

#[proc_macro_attribute]
pub fn emi_doc(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut ast = syn::parse_macro_input!(item as syn::DeriveInput);
    match &mut ast.data {
        syn::Data::Struct(ref mut struct_data) => {
            match &mut struct_data.fields {
                syn::Fields::Named(fields_named) => {
                    for field in &mut fields_named.named {
                        if field.attrs.iter().any(|attr| attr.path().is_ident("emi")) {
                            let entry: entry::Entry = field.clone().into();
                            let doc = format!(
                                "address - `{:#06x}`, data type - `{:?}` (`{}` registers), scaler - `{}`, unit - `{}`.",
                                entry.addr,
                                entry.ty,
                                entry.ty.word_size(),
                                entry.scaler,
                                entry.unit
                            );
                            let doc: syn::Attribute = syn::parse_quote!(#[doc = #doc]);
                            field.attrs.push(doc);
                        }
                    }
                }
                _ => panic!("`emi_doc` has to be applied to structs with named fields"),
            }

            quote! {
                #ast
            }
            .into()
        }
        _ => panic!("`emi_doc` has to be applied with structs"),
    }
}
