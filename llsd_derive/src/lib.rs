#![recursion_limit = "128"]

extern crate proc_macro;
extern crate proc_macro2;

use proc_macro::TokenStream;
use quote::quote;
use syn::*;

/// Derives `llsd::members::Members` for a struct with named fields.
///
/// Every field is marshalable unless marked `#[llsd(skip)]`, and is stored under its
/// own name unless renamed with `#[llsd(rename = "Name")]`. Field types must implement
/// `llsd::native::Native`.
#[proc_macro_derive(Members, attributes(llsd))]
pub fn members_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();

    impl_members_macro(&ast)
}

/// How a single field is marshaled.
struct FieldSpec {
    ident: Ident,
    key: String,
    ty: Type,
}

/// Reads the `#[llsd(...)]` options of a field. `None` means the field is skipped.
fn field_spec(field: &Field) -> Option<FieldSpec> {
    let ident = field.ident.clone().unwrap();
    let mut key = ident.to_string();

    for attr in &field.attrs {
        let list = match attr.interpret_meta() {
            Some(Meta::List(list)) => list,
            _ => continue,
        };
        if list.ident != "llsd" {
            continue;
        }
        for nested in list.nested.iter() {
            match nested {
                NestedMeta::Meta(Meta::Word(word)) if word == "skip" => return None,
                NestedMeta::Meta(Meta::NameValue(MetaNameValue {
                    ident: opt,
                    lit: Lit::Str(name),
                    ..
                })) if opt == "rename" => key = name.value(),
                _ => panic!("unsupported `llsd` attribute on field `{}`", ident),
            }
        }
    }

    Some(FieldSpec {
        ident,
        key,
        ty: field.ty.clone(),
    })
}

fn impl_members_macro(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let specs: Vec<FieldSpec> = match &ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => fields.named.iter().filter_map(field_spec).collect(),
        _ => panic!("`Members` can only be derived for structs with named fields"),
    };

    let keys: &Vec<String> = &specs.iter().map(|s| s.key.clone()).collect();
    let idents: &Vec<Ident> = &specs.iter().map(|s| s.ident.clone()).collect();
    let tys: Vec<Type> = specs.iter().map(|s| s.ty.clone()).collect();

    let imp = quote! {
        impl #impl_generics ::llsd::members::Members for #name #ty_generics #where_clause {
            const FIELDS: &'static [::llsd::members::Field] = &[
                #(::llsd::members::Field::new(
                    #keys,
                    <#tys as ::llsd::native::Native>::FIELD_TYPE,
                )),*
            ];

            fn member(&self, name: &str) -> Option<::llsd::native::NativeValue> {
                match name {
                    #(#keys => Some(::llsd::native::Native::to_native(&self.#idents)),)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set_member(&mut self, name: &str, value: ::llsd::native::NativeValue) -> bool {
                match name {
                    #(#keys => {
                        self.#idents = ::llsd::native::Native::from_native(value);
                        true
                    })*
                    _ => false,
                }
            }
        }
    };
    imp.into()
}
